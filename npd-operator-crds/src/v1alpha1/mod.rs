mod node_problem_detector;

pub use node_problem_detector::{
    ImagePullPolicy, NAME_GROUP_NODE_PROBLEM_DETECTOR, NodeProblemDetector,
    NodeProblemDetectorSpec,
};
