//! Turning request documents into response documents.

use std::path::PathBuf;

use anyhow::Context;
use scribe_config::ScribeConfig;
use scribe_core::serializer::{collect_parsing_errors, serialize_object};
use scribe_core::{ErrorResponse, ObjectRequest, Request, Response};
use scribe_loader::{Loader, ModuleFinder};

/// What every request of one run shares.
#[derive(Debug)]
pub struct Processor {
    config: ScribeConfig,
    search_paths: Vec<PathBuf>,
}

impl Processor {
    #[must_use]
    pub const fn new(config: ScribeConfig, search_paths: Vec<PathBuf>) -> Self {
        Self { config, search_paths }
    }

    /// Answer one JSON request document.
    ///
    /// # Errors
    ///
    /// Fails only when the document itself is malformed; objects that cannot
    /// be documented are reported in the response's `loading_errors`.
    pub fn process_json(&self, input: &str) -> anyhow::Result<Response> {
        let request = Request::from_json(input).context("invalid request document")?;
        Ok(self.process(&request))
    }

    #[must_use]
    pub fn process(&self, request: &Request) -> Response {
        let mut response = Response::default();
        for object in &request.objects {
            if let Err(error) = self.document(request, object, &mut response) {
                tracing::warn!(path = %object.path, error = %format!("{error:#}"), "object not documented");
                response.loading_errors.push(format!("{}: {error:#}", object.path));
            }
        }
        response
    }

    /// A fresh loader per object: caches and errors never leak between objects.
    fn document(&self, request: &Request, object: &ObjectRequest, response: &mut Response) -> anyhow::Result<()> {
        let options = self
            .config
            .resolve_object(&request.global_config, &object.config)
            .context("invalid object configuration")?;
        let finder = ModuleFinder::new(&self.search_paths)?;
        let mut loader = Loader::new(finder, options)?;

        let result = loader.get_object_documentation(&object.path);
        response.loading_errors.extend(loader.take_errors());
        let tree = result?;

        let root = tree.root().context("documented tree has no root")?;
        collect_parsing_errors(&tree, root, response);
        response.objects.push(serialize_object(&tree, root));
        tracing::debug!(path = %object.path, objects = tree.len(), "object documented");
        Ok(())
    }
}

/// The document written instead of a response when a whole input fails.
#[must_use]
pub fn error_response(error: &anyhow::Error) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        traceback: error
            .chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
