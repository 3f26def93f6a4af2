// handlers/public/auth/mod.rs - Public authentication handlers
//
// Account creation and token acquisition. Only routed in authenticated mode.

pub mod login;    // POST /api/login - verify credentials and issue a JWT
pub mod register; // POST /api/register - create a new account
pub mod utils;

pub use login::login_post;
pub use register::register_post;
