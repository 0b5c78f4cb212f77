pub mod archive;
pub mod fetch;
pub mod output;
pub mod ridership;
pub mod stations;
