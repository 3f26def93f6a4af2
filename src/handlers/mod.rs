// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (owner-scoped; JWT required in authenticated mode)

pub mod public;    // /api/health, /api/register, /api/login
pub mod protected; // /api/todos/*
