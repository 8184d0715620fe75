//! Plugin library exporting the `name` predicates.

sift_plugin::export_plugin!(sift_std::NamePlugin);
