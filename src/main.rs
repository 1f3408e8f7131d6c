use gh_repo_graph::App;

fn main() {
	gh_repo_graph::init_logging();
	leptos::mount::mount_to_body(App);
}
