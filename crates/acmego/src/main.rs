fn main() -> anyhow::Result<()> {
    let registry = acmego::app::registry::Registry::builtin();
    let args = acmego::cli::Args::parse_with(&registry);
    acmego::run(args, &registry)
}
