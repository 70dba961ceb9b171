use turnout::{DispatchPlan, MissionRecord, Verdict};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_pass(missions: &[MissionRecord], plans: &[DispatchPlan], color: bool) {
    let palette = ansi::Palette::new(color);

    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Dispatch pass: {} missions", plans.len()), ansi::CYAN))
    );

    println!("\n{}", palette.paint("━━━ Plans ━━━", ansi::GRAY));
    for plan in plans {
        print_plan(missions, plan, &palette);
    }

    let dispatched = plans.iter().filter(|p| p.verdict == Verdict::Dispatch).count();
    let instances: usize = plans.iter().map(|p| p.committed.len()).sum();

    println!("\n{}", palette.paint("━━━ Summary ━━━", ansi::GRAY));
    println!(
        "  Dispatched: {}  │  Skipped: {}  │  Instances committed: {}",
        palette.paint(dispatched.to_string(), ansi::GREEN),
        palette.paint((plans.len() - dispatched).to_string(), ansi::YELLOW),
        palette.paint(instances.to_string(), ansi::CYAN),
    );
    println!();
}

fn print_plan(missions: &[MissionRecord], plan: &DispatchPlan, palette: &ansi::Palette) {
    let mission = missions.iter().find(|m| m.id == plan.mission_id);
    let name = mission.map(|m| m.name.as_str()).unwrap_or("?");
    let credits = mission.map(|m| m.credits).unwrap_or(0);

    let mark = match plan.verdict {
        Verdict::Dispatch => palette.paint("✓", ansi::GREEN),
        Verdict::Skip => palette.paint("✗", ansi::RED),
    };

    println!(
        "  {} {} {} {} {}",
        mark,
        palette.paint(format!("[{}]", plan.mission_id), ansi::GRAY),
        palette.bold(name),
        palette.dim(format!("({credits} Cr)")),
        palette.dim(format!("— {}", plan.reason)),
    );

    if !plan.committed.is_empty() {
        println!("      {} {}", palette.dim("committed:"), palette.paint(plan.committed.join(", "), ansi::YELLOW));
    }
}
