pub mod compare_timer;
