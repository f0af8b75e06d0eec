fn main() { ::densela_tasks::entry_points::densela() }
