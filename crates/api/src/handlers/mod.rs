pub mod approval;
pub mod design;
pub mod portal;
