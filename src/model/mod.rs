pub mod mongodb;
pub mod passport;
pub mod roll;
