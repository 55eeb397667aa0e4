use std::borrow::Cow;
use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub mod providers;
pub use providers::dog_ceo::DogCeoSource;

#[derive(Error, Debug, PartialEq)]
pub enum ImageUrlError {
    #[error("Invalid image url '{url}': {source}")]
    Invalid {
        url: String,
        source: url::ParseError,
    },
    #[error("Image url '{0}' needs at least two path segments to name it")]
    TooShort(String),
}

/// An image location returned by an [`ImageSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl(Url);

impl ImageUrl {
    pub fn parse(raw: &str) -> Result<Self, ImageUrlError> {
        let url = Url::parse(raw).map_err(|source| ImageUrlError::Invalid {
            url: raw.to_string(),
            source,
        })?;
        let segments = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).count())
            .unwrap_or(0);
        if segments < 2 {
            return Err(ImageUrlError::TooShort(raw.to_string()));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Last two path segments, percent-decoded and joined with `_`, e.g.
    /// `.../breeds/bulldog-boston/n02096585_1.jpg` gives
    /// `bulldog-boston_n02096585_1.jpg`.
    pub fn display_name(&self) -> String {
        let segments: Vec<&str> = self
            .0
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        segments[segments.len().saturating_sub(2)..]
            .iter()
            // Segments that do not decode to UTF-8 are kept as sent
            .map(|seg| urlencoding::decode(seg).unwrap_or(Cow::Borrowed(*seg)))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A breed and its sub-breeds, possibly none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breed {
    pub name: String,
    pub sub_breeds: Vec<String>,
}

/// A trait for dog image providers.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Lists the sub-breeds of `breed`, empty when it has none.
    async fn get_sub_breeds(&self, breed: &str) -> Result<Vec<String>>;

    /// Fetches random image urls: one group per sub-breed, or a single group
    /// for the breed itself when `sub_breeds` is empty.
    async fn get_urls(&self, breed: &str, sub_breeds: &[String]) -> Result<Vec<Vec<ImageUrl>>>;

    async fn get_breed(&self, breed: &str) -> Result<Breed> {
        let sub_breeds = self.get_sub_breeds(breed).await?;
        Ok(Breed {
            name: breed.to_string(),
            sub_breeds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_sub_breed() {
        let url =
            ImageUrl::parse("https://images.dog.ceo/breeds/bulldog-boston/n02096585_1.jpg")
                .unwrap();
        assert_eq!(url.display_name(), "bulldog-boston_n02096585_1.jpg");
        assert!(url.display_name().starts_with("bulldog"));
    }

    #[test]
    fn test_display_name_flat_breed() {
        let url = ImageUrl::parse("https://images.dog.ceo/breeds/greyhound-italian/n02091032_7.jpg")
            .unwrap();
        assert_eq!(url.display_name(), "greyhound-italian_n02091032_7.jpg");

        let url = ImageUrl::parse("https://images.dog.ceo/breeds/collie/n02106030_1.jpg").unwrap();
        assert_eq!(url.display_name(), "collie_n02106030_1.jpg");
        assert_eq!(url.to_string(), "https://images.dog.ceo/breeds/collie/n02106030_1.jpg");
    }

    #[test]
    fn test_display_name_ignores_trailing_slash() {
        let url = ImageUrl::parse("https://example.com/a/b/").unwrap();
        assert_eq!(url.display_name(), "a_b");
    }

    #[test]
    fn test_display_name_is_decoded() {
        let url = ImageUrl::parse("https://images.dog.ceo/breeds/collie/dog 1.jpg").unwrap();
        assert_eq!(url.as_str(), "https://images.dog.ceo/breeds/collie/dog%201.jpg");
        assert_eq!(url.display_name(), "collie_dog 1.jpg");

        let url = ImageUrl::parse("https://example.com/caf%C3%A9/%C3%A9t%C3%A9.jpg").unwrap();
        assert_eq!(url.display_name(), "café_été.jpg");
    }

    #[test]
    fn test_parse_too_short() {
        let err = ImageUrl::parse("https://images.dog.ceo/only.jpg").unwrap_err();
        assert_eq!(
            err,
            ImageUrlError::TooShort("https://images.dog.ceo/only.jpg".to_string())
        );
    }

    #[test]
    fn test_parse_invalid() {
        let err = ImageUrl::parse("not a url").unwrap_err();
        assert!(matches!(err, ImageUrlError::Invalid { .. }));
        assert!(err.to_string().contains("not a url"));
    }
}
