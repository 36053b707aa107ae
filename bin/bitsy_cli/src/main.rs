fn main() -> anyhow::Result<()> {
    bitsy_core::run()
}
