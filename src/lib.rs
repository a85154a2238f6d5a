pub mod shared {
    pub mod core {
        pub mod errors;
        pub mod identity;
        pub mod link;
    }
    pub mod infrastructure {
        pub mod json_archive;
    }
}

pub mod modules {
    pub mod project {
        pub mod core {
            pub mod arena;
            pub mod config;
            pub mod entities {
                pub mod address;
                pub mod cost_calculation;
                pub mod cost_group;
                pub mod company;
                pub mod invoice;
                pub mod job;
                pub mod person;
                pub mod trade;
            }
            pub mod project;
        }
        pub mod resolution {
            pub mod engine;
            pub mod registry;
            pub mod restorable;
            pub mod restore;
        }
        pub mod invoice_chain {
            pub mod amounts;
            pub mod guard;
            pub mod ordering;
        }
        pub mod queries {
            pub mod budgets;
        }
        pub mod serialization {
            pub mod decode;
            pub mod encode;
            pub mod records;
        }
        pub mod use_cases {
            pub mod errors;
            pub mod manage_entities {
                pub mod cost_calculations;
                pub mod cost_groups;
                pub mod companies;
                pub mod invoices;
                pub mod jobs;
                pub mod people;
                pub mod trades;
            }
            pub mod import_entities {
                pub mod command;
                pub mod handler;
            }
            pub mod load_project {
                pub mod handler;
            }
            pub mod save_project {
                pub mod handler;
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod json_import;
            }
            pub mod outbound {
                pub mod project_store;
                pub mod project_store_in_memory;
                pub mod project_store_zip;
            }
        }
    }
}

pub mod shell;
