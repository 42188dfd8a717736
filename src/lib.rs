pub mod arms;
