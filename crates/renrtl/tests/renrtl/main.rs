mod multi;
mod single;
