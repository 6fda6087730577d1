use std::fmt;
use std::marker::PhantomData;

/// Numeric identifier tagged with the kind of entity it refers to.
///
/// The dataset and the runtime entities only carry flat numbers; the tag keeps a
/// `VmId` from being passed where a `HostId` is expected.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Id<T> {
    value: u32,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub const fn new(value: u32) -> Self {
        Id { value, _marker: PhantomData }
    }

    pub const fn value(&self) -> u32 {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<u32> for Id<T> {
    fn from(value: u32) -> Self {
        Id::new(value)
    }
}

impl<T> From<Id<T>> for u32 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {}", display_name, self.value)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct WorkflowTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct TaskTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct CloudletTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct VmTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct HostTag;

pub type WorkflowId = Id<WorkflowTag>;
pub type TaskId = Id<TaskTag>;
pub type CloudletId = Id<CloudletTag>;
pub type VmId = Id<VmTag>;
pub type HostId = Id<HostTag>;

/// Dataset-level identity of a task: task ids are only unique within a workflow.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct WorkflowTaskId {
    pub workflow_id: WorkflowId,
    pub task_id: TaskId,
}

impl WorkflowTaskId {
    pub fn new(workflow_id: WorkflowId, task_id: TaskId) -> Self {
        Self { workflow_id, task_id }
    }
}

impl fmt::Display for WorkflowTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workflow_id, self.task_id)
    }
}
