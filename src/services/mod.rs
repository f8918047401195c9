pub mod config_gen;
