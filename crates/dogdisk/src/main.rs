use anyhow::Result;
use dogdisk::cli;

#[tokio::main]
async fn main() -> Result<()> {
    match cli::run().await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            cli::ux::present_error(e);
            std::process::exit(1);
        }
    }
}
