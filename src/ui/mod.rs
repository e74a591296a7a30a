pub mod fonts;
pub mod panels;
pub mod table;
