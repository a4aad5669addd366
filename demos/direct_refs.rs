use bgpsimulator::as_graph::{ASGraph, ASBuilder};

fn main() {
    let builders = vec![
        ASBuilder::new(1)
            .with_customers(vec![2, 3])
            .as_tier_1(),
        ASBuilder::new(2)
            .with_providers(vec![1])
            .with_customers(vec![4]),
        ASBuilder::new(3)
            .with_providers(vec![1])
            .with_peers(vec![2]),
        ASBuilder::new(4)
            .with_providers(vec![2]),
    ];

    let as_graph = ASGraph::build(builders);

    if let Some(as1) = as_graph.get(&1) {
        println!("AS1 has {} customers", as1.customer_asns.len());

        for &customer_asn in &as1.customer_asns {
            println!("  AS1 -> AS{} (customer)", customer_asn);

            if let Some(customer) = as_graph.get(&customer_asn) {
                for &provider_asn in &customer.provider_asns {
                    println!("    AS{} -> AS{} (provider)", customer_asn, provider_asn);
                }
            }
        }
    }

    if let Some(as2) = as_graph.get(&2) {
        println!("\nAS2's relationships:");
        println!("  Providers: {:?}", as2.provider_asns);
        println!("  Customers: {:?}", as2.customer_asns);

        for &provider_asn in &as2.provider_asns {
            if let Some(provider) = as_graph.get(&provider_asn) {
                let has_as_customer = provider.customer_asns.contains(&2);
                println!("  AS{} has AS2 as customer: {}", provider_asn, has_as_customer);
            }
        }
    }
}
