pub mod charts;
pub mod panels;
pub mod tables;
pub mod tabs;
