pub mod db_utils;
pub mod error;
pub mod response;
pub mod validation;
