pub mod capture;
pub mod cli;
pub mod run;
