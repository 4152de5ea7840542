mod common;
mod components;
