pub mod graph_viewer;
