// Route handlers. Everything under /api except the public paths listed in
// middleware::auth runs behind the JWT guard.
pub mod access;
pub mod health;
pub mod news;
