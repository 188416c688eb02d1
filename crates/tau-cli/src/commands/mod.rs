pub mod ensemble;
pub mod run;
