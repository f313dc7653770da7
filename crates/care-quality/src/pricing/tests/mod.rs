mod common;
mod estimator;
