use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");


/// Help colors shared by every catalog binary. Rejected filter values stand out in yellow so a
/// mistyped `--status` or `--type` is easy to spot next to the accepted list.
pub fn styles() -> Styles {
	let heading = AnsiColor::Green.on_default().effects(Effects::BOLD);

	Styles::styled()
		.header(heading)
		.usage(heading)
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::BrightBlack.on_default())
		.valid(AnsiColor::Green.on_default())
		.invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
		.error(AnsiColor::Red.on_default().effects(Effects::BOLD))
}
