// Daily metric tracking. Samples are append-only.

pub mod handlers;
