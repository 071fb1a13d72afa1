fn main() -> anyhow::Result<()> {
    synth_router::run()
}
