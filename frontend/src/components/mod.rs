pub mod google_button;
