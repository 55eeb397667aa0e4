pub mod dog_ceo;
