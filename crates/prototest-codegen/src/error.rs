use prototest_core::ModelError;

/// Model authoring defects that stop a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "Duplicate test `{test}` in {file}: fixture `{id}` collides with fixture `{previous}`"
    )]
    DuplicateFixtureId {
        id: String,
        previous: String,
        test: String,
        file: String,
    },
    #[error("Fixture `{id}` is missing required expectation `{field}`")]
    MissingExpectation { id: String, field: &'static str },
    #[error("Fixture `{fixture}`: param {path} {message}")]
    InvalidParam {
        fixture: String,
        path: String,
        message: String,
    },
    #[error("Fixture `{fixture}`: param {path} names unknown member of {shape}")]
    UnknownMember {
        fixture: String,
        path: String,
        shape: String,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}
