//! Per-job counts of instances by host attribute value.

use std::collections::HashMap;

use berth_id::JobKey;
use berth_model::Attribute;

/// Snapshot of where a job's active instances currently run, keyed by the
/// attributes of their hosts.
///
/// Implementations must be immutable for the duration of an evaluation.
pub trait AttributeAggregate: Send + Sync {
    /// Number of the job's active instances on hosts whose attribute `name`
    /// includes `value`.
    fn instances_with_attribute(&self, name: &str, value: &str) -> u64;
}

impl<T: AttributeAggregate + ?Sized> AttributeAggregate for &T {
    fn instances_with_attribute(&self, name: &str, value: &str) -> u64 {
        (**self).instances_with_attribute(name, value)
    }
}

impl<T: AttributeAggregate + ?Sized> AttributeAggregate for std::sync::Arc<T> {
    fn instances_with_attribute(&self, name: &str, value: &str) -> u64 {
        (**self).instances_with_attribute(name, value)
    }
}

/// Aggregate for a job with no active instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyAggregate;

impl AttributeAggregate for EmptyAggregate {
    fn instances_with_attribute(&self, _name: &str, _value: &str) -> u64 {
        0
    }
}

/// Aggregate built from the hosts a job's active instances occupy.
#[derive(Debug, Clone)]
pub struct JobAttributeAggregate {
    job: JobKey,
    // attribute name -> value -> instance count
    counts: HashMap<String, HashMap<String, u64>>,
}

impl JobAttributeAggregate {
    /// Creates an empty aggregate for `job`.
    pub fn new(job: JobKey) -> Self {
        Self {
            job,
            counts: HashMap::new(),
        }
    }

    /// Builds an aggregate from one attribute list per active instance.
    pub fn from_hosts<'a, I>(job: JobKey, hosts: I) -> Self
    where
        I: IntoIterator<Item = &'a [Attribute]>,
    {
        let mut aggregate = Self::new(job);
        for attributes in hosts {
            aggregate.record_host(attributes);
        }
        aggregate
    }

    /// Records one active instance placed on a host with `attributes`.
    pub fn record_host(&mut self, attributes: &[Attribute]) {
        for attribute in attributes {
            let by_value = self.counts.entry(attribute.name.clone()).or_default();
            for value in &attribute.values {
                *by_value.entry(value.clone()).or_insert(0) += 1;
            }
        }
    }

    pub fn job(&self) -> &JobKey {
        &self.job
    }
}

impl AttributeAggregate for JobAttributeAggregate {
    fn instances_with_attribute(&self, name: &str, value: &str) -> u64 {
        self.counts
            .get(name)
            .and_then(|by_value| by_value.get(value))
            .copied()
            .unwrap_or(0)
    }
}
