pub mod smartctl;
