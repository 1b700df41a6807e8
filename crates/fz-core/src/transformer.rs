//! Inference-time transformers.
//!
//! A [`Transformer`] maps each input to zero or more outputs delivered via a
//! callback. Stateful transformers may buffer and emit the remainder on
//! [`Transformer::flush`]. Only transformer state is persisted through
//! `save`/`load`; the estimator that created it is not referenced.

use tracing::trace;

use crate::archive::Archive;
use crate::error::{FeaturizerError, Result};

/// Inference component produced by an estimator or restored from an archive.
pub trait Transformer {
    /// Item consumed by `execute`.
    type Input;

    /// Item emitted to the callback.
    type Output;

    /// Process one input, emitting outputs through `callback`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` after `flush`, or a transformer-specific error.
    fn execute(&mut self, input: &Self::Input, callback: &mut dyn FnMut(Self::Output)) -> Result<()>;

    /// Signal end of stream and drain any buffered outputs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the stream was already flushed.
    fn flush(&mut self, callback: &mut dyn FnMut(Self::Output)) -> Result<()>;

    /// Write the transformer state to `archive`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is not writable.
    fn save(&self, archive: &mut Archive) -> Result<()>;

    /// Restore a transformer from `archive`.
    ///
    /// # Errors
    ///
    /// Returns a format error for unsupported versions or malformed bytes.
    fn load(archive: &mut Archive) -> Result<Self>
    where
        Self: Sized;

    /// Execute a transform that yields exactly one output per input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the transformer emitted no output or more
    /// than one.
    fn execute_one(&mut self, input: &Self::Input) -> Result<Self::Output> {
        let mut outputs = Vec::with_capacity(1);
        self.execute(input, &mut |output| outputs.push(output))?;

        let count = outputs.len();
        match (outputs.pop(), count) {
            (Some(output), 1) => Ok(output),
            _ => Err(FeaturizerError::invalid_state(format!(
                "expected exactly one output, got {count}"
            ))),
        }
    }

    /// Serialize the transformer state into a fresh byte buffer.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Transformer::save`].
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut archive = Archive::new();
        self.save(&mut archive)?;
        let bytes = archive.commit()?;
        trace!(len = bytes.len(), "serialized transformer");
        Ok(bytes)
    }

    /// Restore a transformer from bytes produced by [`Transformer::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns a format error for malformed input or trailing bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        let mut archive = Archive::from_slice(bytes);
        let transformer = Self::load(&mut archive)?;
        archive.ensure_at_end()?;
        Ok(transformer)
    }
}

/// Tracks whether a transformer's input stream has been flushed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamState {
    flushed: bool,
}

impl StreamState {
    /// Create an open stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once the stream has been flushed.
    #[must_use]
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Fail unless the stream still accepts input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` after `flush`.
    pub fn ensure_open(&self) -> Result<()> {
        if self.flushed {
            Err(FeaturizerError::invalid_state("execute called after flush"))
        } else {
            Ok(())
        }
    }

    /// Mark the stream as flushed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if it was already flushed.
    pub fn mark_flushed(&mut self) -> Result<()> {
        if self.flushed {
            return Err(FeaturizerError::invalid_state("flush called twice"));
        }
        self.flushed = true;
        Ok(())
    }
}
