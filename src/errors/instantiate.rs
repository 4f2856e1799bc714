#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Missing argument {name} for builder")]
    MissingArgument { name: &'static str },
    #[error("Incorrect type of argument {name} for builder")]
    ArgumentType { name: &'static str },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
