pub mod cert;
pub mod dispatch;
pub mod health;
pub mod personnel;
pub mod schema;
pub mod seed;
pub mod serve;
pub mod shared;
pub mod site;
pub mod stats;
