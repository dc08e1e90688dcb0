#![allow(dead_code)]

pub mod title_server;
