// Application layer: the interactive front end over the core.

pub mod menu;
