pub mod application {
    pub mod execution {
        pub mod get_history;
        pub mod run_remote;
        pub mod run_shell;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod execution {
        pub mod duration;
        pub mod errors;
        pub mod executor;
        pub mod model;
        pub mod repository;
        pub mod use_cases {
            pub mod get_history;
            pub mod run_remote;
            pub mod run_shell;
        }
    }
    pub mod sharding {
        pub mod errors;
        pub mod pool;
        pub mod routing;
    }
}
