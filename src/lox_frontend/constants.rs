pub const MAX_FUNC_ARGS: usize = 255;

pub const INIT_STR: &str = "init";
pub const THIS_STR: &str = "this";
pub const SUPER_STR: &str = "super";
pub const LAMBDA_STR: &str = "lambda";
