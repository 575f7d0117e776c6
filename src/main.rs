fn main() -> std::io::Result<()> {
    pyide::run()
}
