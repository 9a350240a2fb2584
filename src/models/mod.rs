pub mod location;
pub mod perimeter;
pub mod shift;
pub mod worker;
