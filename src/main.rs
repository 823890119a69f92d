fn main() {
    std::process::exit(relaybot::app::startup::run());
}
