use kfgen_generator::crd::{PyTorchJob, TFJob};
use kube::CustomResourceExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifests = [
        ("tfjob_crd.yaml", serde_yaml::to_string(&TFJob::crd())?),
        ("pytorchjob_crd.yaml", serde_yaml::to_string(&PyTorchJob::crd())?),
    ];

    for (path, yaml) in manifests {
        std::fs::write(path, yaml)?;
        println!("wrote {}", path);
    }
    Ok(())
}
