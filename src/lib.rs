#![no_std]

pub mod hardware;
