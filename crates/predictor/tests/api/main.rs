mod catalog;
mod predict;
