fn main() -> Result<(), Box<dyn std::error::Error>> {
    trove::run()
}
