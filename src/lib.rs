pub mod lox_frontend;
pub mod runner;
pub mod treewalk_interpreter;
