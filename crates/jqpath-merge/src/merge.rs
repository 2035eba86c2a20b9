// SPDX-License-Identifier: MIT OR Apache-2.0
use serde_json::Value;

/// How sequences present on both sides are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStrategy {
    /// The overlay's sequence wins wholesale
    #[default]
    Replace,
    /// The overlay's elements are appended to the base's
    Concat,
}

/// Options for [`merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Sequence handling
    pub list_strategy: ListStrategy,
}

impl MergeOptions {
    /// Concatenate sequences instead of replacing them
    #[must_use]
    pub const fn concat(mut self) -> Self {
        self.list_strategy = ListStrategy::Concat;
        self
    }

    /// Set the sequence strategy
    #[must_use]
    pub const fn with_list_strategy(mut self, strategy: ListStrategy) -> Self {
        self.list_strategy = strategy;
        self
    }
}

/// Deep merge `overlay` onto a copy of `base`
#[must_use]
pub fn merge(base: &Value, overlay: &Value, options: &MergeOptions) -> Value {
    let mut result = base.clone();
    merge_into(&mut result, overlay, options);
    result
}

/// Deep merge `overlay` onto `base` in place
pub fn merge_into(base: &mut Value, overlay: &Value, options: &MergeOptions) {
    match (base, overlay) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(key) {
                    Some(existing) => merge_into(existing, value, options),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source))
            if options.list_strategy == ListStrategy::Concat =>
        {
            target.extend(source.iter().cloned());
        }
        (target, source) => *target = source.clone(),
    }
}

/// Merge a series of documents left to right
///
/// Returns `null` for an empty series.
pub fn merge_many<'a, I>(documents: I, options: &MergeOptions) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut documents = documents.into_iter();
    let Some(first) = documents.next() else {
        return Value::Null;
    };
    let mut result = first.clone();
    let mut count = 1usize;
    for document in documents {
        merge_into(&mut result, document, options);
        count += 1;
    }
    tracing::debug!(documents = count, strategy = ?options.list_strategy, "merge_many");
    result
}
