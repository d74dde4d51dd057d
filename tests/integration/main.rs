//! Integration tests against an in-memory visitor store

mod api;
mod common;
mod resolver;
