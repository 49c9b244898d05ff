use csvsheet::ui::app::App;

fn main() {
    csvsheet::logging::init();

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title("CsvSheet")
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1200.0, 800.0)),
                )
                .with_close_behaviour(dioxus::desktop::WindowCloseBehaviour::LastWindowHides),
        )
        .launch(App);
}
