// handlers/protected/mod.rs - Owner-scoped handlers
//
// In authenticated mode these routes sit behind the JWT gate and every
// lookup is restricted to the caller's records. In open mode the same
// handlers run unscoped.

pub mod todos;
