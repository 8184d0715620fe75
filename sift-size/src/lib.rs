//! Plugin library exporting the `size` predicates.

sift_plugin::export_plugin!(sift_std::SizePlugin);
