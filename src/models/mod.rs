pub mod user;
pub mod guide;
pub mod restaurant;

pub use user::{landing_route, LoginRequest, LoginResponse, OtpRequest, RegisterRequest, RegisterResponse, Role};
pub use guide::GuideProfile;
pub use restaurant::{FoodType, RestaurantProfile};
