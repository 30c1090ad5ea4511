pub mod user {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod relationship {
    pub mod schema;
    pub mod state;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    #[cfg(test)]
    pub mod repository_mem;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod post {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod comment {
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}
