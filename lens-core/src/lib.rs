pub mod metric;
pub mod model;
pub mod reassignment;

pub use metric::{Count, LabeledSeries, MetricKind, Sample};
pub use model::{
    Broker, BrokerId, ClusterInfo, ConfigEntry, NewTopic, Partition, PartitionId, TimeWindow,
    Topic, CLUSTER_DEFAULT,
};
pub use reassignment::{
    OngoingReassignment, PartitionAssignment, PartitionReassignment, TopicAssignment,
    TopicReassignment,
};
