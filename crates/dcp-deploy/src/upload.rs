use dcp_store::ContentRepository;
use dcp_types::{fields, ContentHash, ModelNode};
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::context::ExecutionContext;
use crate::error::{DeployError, DeployResult};
use crate::resolver::ContentResolver;
use crate::transformer::CompositeOperationAwareTransformer;

/// Stores new deployment content and queues the hash-referencing rewrite
/// of the operation that carried it.
#[derive(Default)]
pub struct ContentUploader {
    resolver: ContentResolver,
}

impl ContentUploader {
    pub fn new(config: FetchConfig) -> Self {
        Self::with_resolver(ContentResolver::new(config))
    }

    pub fn with_resolver(resolver: ContentResolver) -> Self {
        Self { resolver }
    }

    /// Store the content of `operation` and queue its rewritten form.
    ///
    /// On success the content is in `repository`, the context's deferred
    /// transformation queue has grown by one transformer that substitutes a
    /// copy of `operation` whose content list is `[{hash: <hash>}]`, and the
    /// hash is returned. `operation` itself is never modified. On failure
    /// nothing is queued.
    pub fn store_content_and_transform<C>(
        &self,
        operation: &ModelNode,
        context: &mut C,
        repository: &dyn ContentRepository,
    ) -> DeployResult<ContentHash>
    where
        C: ExecutionContext + ?Sized,
    {
        let descriptor = new_content_descriptor(operation)?;
        let hash = self.store_content(descriptor, context, repository)?;

        let mut rewritten = operation.clone();
        rewritten.set(
            fields::CONTENT,
            vec![ModelNode::object().with(fields::HASH, hash)],
        );
        let queue = context.transformers_or_init();
        queue.push(CompositeOperationAwareTransformer::new(rewritten));

        info!(
            hash = %hash.short_hex(),
            queued = queue.len(),
            "stored deployment content"
        );
        Ok(hash)
    }

    fn store_content<C>(
        &self,
        descriptor: &ModelNode,
        context: &mut C,
        repository: &dyn ContentRepository,
    ) -> DeployResult<ContentHash>
    where
        C: ExecutionContext + ?Sized,
    {
        let mut stream = self.resolver.resolve(descriptor, context)?;
        debug!(source = stream.source_field(), "handing content to repository");
        // `stream` is dropped on every exit path, releasing owned streams.
        let hash = repository.add_content(&mut stream)?;
        Ok(hash)
    }
}

/// Store the content of `operation` using a default [`ContentUploader`].
///
/// Each call builds a fresh uploader, and with it a fresh HTTP agent and
/// connection pool. Callers ingesting repeatedly should hold one
/// [`ContentUploader`] and call
/// [`ContentUploader::store_content_and_transform`] on it instead.
pub fn store_content_and_transform<C>(
    operation: &ModelNode,
    context: &mut C,
    repository: &dyn ContentRepository,
) -> DeployResult<ContentHash>
where
    C: ExecutionContext + ?Sized,
{
    ContentUploader::default().store_content_and_transform(operation, context, repository)
}

/// The first content descriptor of `operation`, provided it is new content.
fn new_content_descriptor(operation: &ModelNode) -> DeployResult<&ModelNode> {
    let Some(content) = operation.get_defined(fields::CONTENT) else {
        warn!("deployment operation declares no content");
        return Err(DeployError::InvalidContentDeclaration);
    };
    let Some(items) = content.as_list() else {
        warn!("deployment content is not a list");
        return Err(DeployError::InvalidContentDeclaration);
    };
    let Some(descriptor) = items.first() else {
        return Err(DeployError::UndeclaredContent);
    };
    if descriptor.has_defined(fields::HASH) {
        warn!("deployment content is already stored");
        return Err(DeployError::InvalidContentDeclaration);
    }
    Ok(descriptor)
}
