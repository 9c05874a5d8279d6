fn main() {
    // The ESP-IDF build environment is only present when cross-compiling
    // with the espidf feature; host test builds skip it entirely.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
